fn main() -> std::process::ExitCode {
    server::process::run(server::ServiceKind::AppProduct)
}

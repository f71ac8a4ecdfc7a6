use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use configs::CredentialsConfig;
use service::credentials::{Argon2Hasher, CredentialHasher};
use service::user::domain::{CreateUserInput, CredentialLookup};
use service::user::repository::mock::InMemoryUserRepository;
use service::user::UserService;

fn profile_defaults() -> CredentialsConfig {
    CredentialsConfig { salt: "bench-credential-salt".into(), ..CredentialsConfig::default() }
}

fn bench_hash(c: &mut Criterion) {
    let hasher = Argon2Hasher::new(&profile_defaults()).unwrap();
    c.bench_function("argon2_hash_profile_defaults", |b| {
        b.iter(|| hasher.hash("Benchmark1").unwrap());
    });
}

fn bench_credential_lookup(c: &mut Criterion) {
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new(&profile_defaults()).unwrap());
    let svc = UserService::new(Arc::new(InMemoryUserRepository::default()), hasher);

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.create_user(CreateUserInput {
        email: "bench@example.com".into(),
        plaintext_password: "Benchmark1".into(),
    }))
    .unwrap();

    c.bench_function("user_lookup_by_credentials", |b| {
        b.iter(|| {
            let lookup = CredentialLookup { email: "bench@example.com".into(), plaintext_password: "Benchmark1".into() };
            rt.block_on(svc.get_user_by_email_and_password(lookup)).unwrap()
        });
    });
}

criterion_group!(benches, bench_hash, bench_credential_lookup);
criterion_main!(benches);

//! Typed remote procedures between the edge and backend processes.
//!
//! A procedure is named by a [`MethodDescriptor`] (service + method) and its
//! request/response shapes are fixed by a [`RemoteMethod`] marker type that
//! both sides share. Backends collect handlers in an [`RpcRegistry`] and
//! expose it through [`server::router`]; callers reach it through an
//! [`RpcClient`] obtained from the [`ServiceLocator`].
//!
//! Wire format: `POST /rpc/{service}/{method}` with a JSON body, answered by
//! an [`RpcReply`] envelope.

pub mod client;
pub mod contracts;
pub mod descriptor;
pub mod error;
pub mod locator;
pub mod registry;
pub mod server;
pub mod transport;
pub mod wire;

pub use client::RpcClient;
pub use descriptor::{MethodDescriptor, RemoteMethod};
pub use error::{RegistryError, RpcError};
pub use locator::ServiceLocator;
pub use registry::{RegistryBuilder, RpcRegistry};
pub use transport::{HttpTransport, LocalTransport, RpcTransport};
pub use wire::{FaultCode, RpcFault, RpcReply};

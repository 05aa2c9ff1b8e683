#![allow(dead_code)]

pub mod dns_server_mock;
pub mod mocks;

pub use dns_server_mock::{MockBehavior, MockDnsServer};
pub use mocks::{
    answer_for, client_query, DispatchScript, FailingCallback, MockDispatcher, MockRouter,
    RecordingSender, CLIENT_ADDR,
};

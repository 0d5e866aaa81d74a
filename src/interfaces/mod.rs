//! Interface adapters — HTTP API

pub mod http;

// Interface adapters: HTTP surface, session gate middleware and upstream clients.

pub mod clients;
pub mod handlers;
pub mod http;
pub mod middleware;
pub mod protocol;
pub mod routes;
pub mod state;

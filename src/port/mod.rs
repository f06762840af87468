//! Ports: trait contracts between the application core and the outside
//! world. Adapters implement these; the core never names a concrete
//! backend.

pub mod outbound;

// src/lib.rs
pub mod data {
    pub mod cache;
    pub mod export;
    pub mod markers;
    pub mod table;
}

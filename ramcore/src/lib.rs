// data module
pub mod data {
    pub mod series;
    pub mod spectrum;
    pub mod trace;
}

// algorithm module
pub mod algorithm {
    pub mod filter;
    pub mod grid;
    pub mod normalize;
    pub mod pipeline;
}

pub mod error;


pub mod service {
    pub mod archive;
    pub mod automation;
    pub mod config_service;
    pub mod discovery;
    pub mod traits {
        pub mod i_service;
    }
}

pub mod config {
    pub mod config;
    pub mod ports;
}

pub mod models {
    pub mod conversion;
    pub mod document;
    pub mod error;
    pub mod file;
    pub mod progress;
}

pub mod facade {
    pub mod conversion_facade;
    pub mod worker;
    pub mod traits {
        pub mod i_conversion;
    }
}

pub mod action {
    pub mod cli;
    pub mod interactive;
}

pub mod utils {
    pub mod convert;
    pub mod utils;
}

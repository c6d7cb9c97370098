pub mod application {
    pub mod entry_service;
    pub mod user_service;
}

pub mod data {
    pub mod entry_repository;
    pub mod user_repository;
}

pub mod domain {
    pub mod entry;
    pub mod error;
    pub mod repository;
    pub mod user;
}

pub mod infrastructure {
    pub mod config;
    pub mod logging;
}

pub mod presentation {
    pub mod entries;
    pub mod handlers;
    pub mod middleware;
    pub mod users;
}

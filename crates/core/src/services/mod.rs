pub mod calculator;
pub mod migration;
pub mod repository;
pub mod share;

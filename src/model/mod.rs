pub mod data;
pub mod parsers;
pub mod repository;
pub mod web;

mod repository;
mod shared;

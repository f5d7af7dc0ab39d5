mod audit;
mod board;
mod catalog;
mod common;

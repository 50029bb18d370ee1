#![cfg(test)]

mod drops;
mod model;
mod panics;
mod probe;
mod serialization;
mod zst;

pub mod classify;
pub mod demand;
pub mod grid;
pub mod normalize;
pub mod scorer;
pub mod table;

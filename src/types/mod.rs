pub mod period;
pub mod resolution;
pub mod series;
pub mod station;
pub mod variable;

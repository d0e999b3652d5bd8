pub mod formula;
pub mod histogram;
pub mod joint;
pub mod partition;
pub mod point_group;
pub mod relations;
pub mod table;

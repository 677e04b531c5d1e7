pub mod names;
pub mod principals;
pub mod split;
pub mod visible;

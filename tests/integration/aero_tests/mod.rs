mod cache;
mod drag;
mod geometry;
mod stability;
mod sweep;
mod table;

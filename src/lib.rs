//! A night sky with a glowing moon and paper lanterns that carry wishes
//! upward, rendered in software into a minifb window.

pub mod background;
pub mod canvas;
pub mod color;
pub mod config;
pub mod lantern;
pub mod moon;
pub mod scene;
pub mod spark;
pub mod stars;
pub mod text;
pub mod ui;

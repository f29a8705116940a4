mod all;
mod canvas;
mod footer;
mod log;
mod side;
mod tab_bar;

use self::log::log;
use super::*;
use canvas::canvas;
use footer::footer;
use side::side;
use tab_bar::tab_bar;

pub use all::all as render;

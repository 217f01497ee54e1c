pub mod code_viewer;
pub mod menu;
pub mod result_screen;
pub mod scoreboard;
pub mod timer_bar;

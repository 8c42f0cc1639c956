//! App-level panel rendering: menu bar, sidebar, channel view and composer.

mod input;
mod panels;

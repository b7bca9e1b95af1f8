//! Interactive line editor: decodes keys from a [`Terminal`], edits a single
//! logical line with Emacs-style bindings, and paints prompt, text, inline
//! history suggestion and the completion menu.
//!
//! ```no_run
//! use core_complete::Completer;
//! use core_history::History;
//! use core_readline::{Readline, ReadlineError, ReadlineOptions};
//! use core_terminal::CrosstermTerminal;
//!
//! let mut rl = Readline::new(
//!     CrosstermTerminal::new(),
//!     History::default(),
//!     Completer::from_env(),
//!     ReadlineOptions::default(),
//! );
//! loop {
//!     match rl.read_line() {
//!         Ok(line) => println!("{line}"),
//!         Err(ReadlineError::Eof) => break,
//!         Err(e) => panic!("{e}"),
//!     }
//! }
//! ```
//!
//! [`Terminal`]: core_terminal::Terminal

mod controller;
mod error;
pub mod keymap;

pub use controller::{Readline, ReadlineOptions};
pub use error::ReadlineError;

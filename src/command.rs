//! The batch command language understood by the `avl-cli` binary.
//!
//! A script is a whitespace-separated token stream: a batch count, then for each
//! batch a command count followed by that many commands. Every batch runs
//! against a fresh tree and every command yields exactly one [`Reply`].
//!
//! ```text
//! 1
//! 4
//! insert 40
//! insert 20
//! rank 40
//! size
//! ```
//!
//! # Examples
//!
//! ```
//! use rank_avl::command::{parse_script, run_batch};
//!
//! let batches = parse_script("1 4 insert 40 insert 20 rank 40 size").unwrap();
//! let replies: Vec<String> = run_batch(&batches[0]).iter().map(ToString::to_string).collect();
//! assert_eq!(replies, ["1", "2", "2 2", "2"]);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::num::ParseIntError;
use core::str::{FromStr, SplitWhitespace};

use log::debug;
use thiserror::Error;

use crate::AvlTree;

const PREALLOCATE_LIMIT: usize = 1 << 12;

/// One operation on the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Insert(i64),
    Erase(i64),
    Find(i64),
    Rank(i64),
    Ancestor(i64),
    Average(i64),
    Height,
    Size,
    Empty,
}

/// What a [`Command`] returned, formatted the way the CLI prints it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reply {
    /// `insert`, `erase` and `find`.
    DepthHeight(usize),
    Rank { depth_height: usize, rank: usize },
    Ancestor { depth_height: usize, sum: i64 },
    Average(i64),
    Height(isize),
    Size(usize),
    Empty(bool),
}

/// Errors raised while reading a script or a single command.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseCommandError {
    #[error("expected {expected} but the input ended")]
    UnexpectedEnd { expected: &'static str },
    #[error("invalid {expected} `{token}`")]
    InvalidNumber {
        expected: &'static str,
        token: String,
        #[source]
        source: ParseIntError,
    },
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("unexpected trailing input `{0}`")]
    TrailingInput(String),
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Tokens {
            inner: input.split_whitespace(),
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, ParseCommandError> {
        self.inner.next().ok_or(ParseCommandError::UnexpectedEnd { expected })
    }

    fn number<T>(&mut self, expected: &'static str) -> Result<T, ParseCommandError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        let token = self.next(expected)?;
        token.parse().map_err(|source| ParseCommandError::InvalidNumber {
            expected,
            token: token.to_string(),
            source,
        })
    }

    fn finish(mut self) -> Result<(), ParseCommandError> {
        match self.inner.next() {
            None => Ok(()),
            Some(token) => Err(ParseCommandError::TrailingInput(token.to_string())),
        }
    }
}

impl Command {
    fn parse_from(tokens: &mut Tokens<'_>) -> Result<Self, ParseCommandError> {
        let name = tokens.next("a command")?;
        let command = match name {
            "insert" => Command::Insert(tokens.number("key")?),
            "erase" => Command::Erase(tokens.number("key")?),
            "find" => Command::Find(tokens.number("key")?),
            "rank" => Command::Rank(tokens.number("key")?),
            "ancestor" => Command::Ancestor(tokens.number("key")?),
            "average" => Command::Average(tokens.number("key")?),
            "height" => Command::Height,
            "size" => Command::Size,
            "empty" => Command::Empty,
            _ => return Err(ParseCommandError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }

    /// Runs the command against `tree`.
    pub fn apply(self, tree: &mut AvlTree<i64>) -> Reply {
        match self {
            Command::Insert(key) => Reply::DepthHeight(tree.insert(key)),
            Command::Erase(key) => Reply::DepthHeight(tree.erase(&key)),
            Command::Find(key) => Reply::DepthHeight(tree.find(&key).1),
            Command::Rank(key) => {
                let (depth_height, rank) = tree.rank(&key);
                Reply::Rank { depth_height, rank }
            }
            Command::Ancestor(key) => {
                let (depth_height, sum) = tree.ancestor(&key);
                Reply::Ancestor { depth_height, sum }
            }
            Command::Average(key) => Reply::Average(tree.average(&key)),
            Command::Height => Reply::Height(tree.height()),
            Command::Size => Reply::Size(tree.size()),
            Command::Empty => Reply::Empty(tree.empty()),
        }
    }
}

/// Parses exactly one command, e.g. `"rank 40"`.
impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens::new(s);
        let command = Command::parse_from(&mut tokens)?;
        tokens.finish()?;
        Ok(command)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reply::DepthHeight(value) | Reply::Size(value) => write!(f, "{value}"),
            Reply::Rank { depth_height, rank } => write!(f, "{depth_height} {rank}"),
            Reply::Ancestor { depth_height, sum } => write!(f, "{depth_height} {sum}"),
            Reply::Average(value) => write!(f, "{value}"),
            Reply::Height(value) => write!(f, "{value}"),
            Reply::Empty(empty) => write!(f, "{}", u8::from(empty)),
        }
    }
}

/// Parses a whole script into its batches.
///
/// # Errors
///
/// Returns the first [`ParseCommandError`] met; nothing is executed before the
/// whole script has been read.
pub fn parse_script(input: &str) -> Result<Vec<Vec<Command>>, ParseCommandError> {
    let mut tokens = Tokens::new(input);
    let batch_count: usize = tokens.number("batch count")?;

    let mut batches = Vec::with_capacity(batch_count.min(PREALLOCATE_LIMIT));
    for _ in 0..batch_count {
        let command_count: usize = tokens.number("command count")?;
        let mut batch = Vec::with_capacity(command_count.min(PREALLOCATE_LIMIT));
        for _ in 0..command_count {
            batch.push(Command::parse_from(&mut tokens)?);
        }
        batches.push(batch);
    }

    tokens.finish()?;
    debug!("parsed {} batches", batches.len());
    Ok(batches)
}

/// Runs one batch against a fresh tree and collects a reply per command.
#[must_use]
pub fn run_batch(batch: &[Command]) -> Vec<Reply> {
    let mut tree = AvlTree::with_capacity(batch.len());
    batch.iter().map(|command| command.apply(&mut tree)).collect()
}

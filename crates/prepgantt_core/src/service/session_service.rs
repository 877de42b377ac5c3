//! Session snapshot use-case service.
//!
//! # Responsibility
//! - Persist the current board as one JSON blob and restore it on startup.
//! - Fall back to the catalog defaults when no usable snapshot exists.
//!
//! # Invariants
//! - Saved snapshots preserve unit order exactly.
//! - A corrupt snapshot is never partially applied.

use crate::board::store::Board;
use crate::model::unit::Unit;
use crate::repo::blob_repo::{keys, BlobStore, RepoError};
use crate::service::snapshot::{decode, CorruptSnapshot};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Session persistence errors.
#[derive(Debug)]
pub enum SessionError {
    CorruptSnapshot(CorruptSnapshot),
    Encode(serde_json::Error),
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptSnapshot(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode session snapshot: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptSnapshot(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CorruptSnapshot> for SessionError {
    fn from(value: CorruptSnapshot) -> Self {
        Self::CorruptSnapshot(value)
    }
}

/// Loads and saves the working board.
pub struct SessionService<S: BlobStore> {
    store: S,
}

impl<S: BlobStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Restores the saved board.
    ///
    /// Returns `Ok(None)` when nothing was saved, and `CorruptSnapshot` when
    /// the blob does not parse or breaks board invariants.
    pub fn try_load_board(&self) -> Result<Option<Board>, SessionError> {
        let Some(blob) = self.store.load(keys::BLOCKS)? else {
            return Ok(None);
        };
        let units: Vec<Unit> = decode(keys::BLOCKS, &blob)?;
        let board = Board::from_units(units).map_err(|err| CorruptSnapshot {
            key: keys::BLOCKS,
            message: err.to_string(),
        })?;
        debug!(
            "event=session_load module=session status=ok units={}",
            board.len()
        );
        Ok(Some(board))
    }

    /// Restores the saved board, or builds the default board when nothing
    /// usable is stored. Only storage failures are returned as errors.
    pub fn load_board(&self) -> Result<Board, SessionError> {
        self.load_with_fallback().map(|(board, _)| board)
    }

    /// Like `load_board`, but also saves the default board when it had to
    /// fall back, so unit ids stay stable across process runs.
    pub fn load_or_init_board(&self) -> Result<Board, SessionError> {
        let (board, fell_back) = self.load_with_fallback()?;
        if fell_back {
            self.save_board(&board)?;
        }
        Ok(board)
    }

    /// Overwrites the saved snapshot with the board's current units.
    pub fn save_board(&self, board: &Board) -> Result<(), SessionError> {
        let blob = serde_json::to_string(board.units()).map_err(SessionError::Encode)?;
        self.store.save(keys::BLOCKS, &blob)?;
        debug!(
            "event=session_save module=session status=ok units={} revision={}",
            board.len(),
            board.revision()
        );
        Ok(())
    }

    /// Drops the saved snapshot; the next load starts from defaults.
    pub fn clear(&self) -> Result<bool, SessionError> {
        Ok(self.store.delete(keys::BLOCKS)?)
    }

    fn load_with_fallback(&self) -> Result<(Board, bool), SessionError> {
        match self.try_load_board() {
            Ok(Some(board)) => Ok((board, false)),
            Ok(None) => {
                info!("event=session_load module=session status=empty fallback=defaults");
                Ok((Board::with_defaults(), true))
            }
            Err(SessionError::CorruptSnapshot(err)) => {
                warn!(
                    "event=session_load module=session status=corrupt fallback=defaults key={}",
                    err.key
                );
                Ok((Board::with_defaults(), true))
            }
            Err(other) => Err(other),
        }
    }
}

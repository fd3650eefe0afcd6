//! The move orchestrator.
//!
//! One request runs to completion before the next: resolve a single
//! candidate, stage capture and placement on a copy of the position, drive
//! the actuator, then swap the staged copy in and flip the turn. A rejected
//! request or a failed actuation leaves the live position untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::actuator::{transport_legs, Actuator};
use crate::board::CellColor;
use crate::error::{ActuatorError, MoveError, NoCandidate};
use crate::manager::ResolvedMove;
use crate::position::Position;
use crate::request::{MoveRequest, Request};
use crate::rules::Shape;
use crate::snapshot::{CapturedPiece, MoveRecord, StatusSnapshot};
use crate::types::{PieceColor, PieceKind};

/// Where the controller is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    WaitingForMove,
    Resolving,
    CapturePending,
    Actuating,
    Committed,
}

/// Result of a committed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// Side to move after the commit.
    pub turn: PieceColor,
}

/// Answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Moved(MoveOutcome),
    Status(StatusSnapshot),
}

pub struct MoveResolver<A> {
    position: Position,
    history: Vec<MoveRecord>,
    phase: Phase,
    actuator: A,
}

impl<A: Actuator> MoveResolver<A> {
    /// Controller for a fresh game.
    pub fn new(actuator: A) -> Self {
        Self::with_position(Position::standard(), actuator)
    }

    pub fn with_position(position: Position, actuator: A) -> Self {
        Self {
            position,
            history: Vec::new(),
            phase: Phase::WaitingForMove,
            actuator,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn turn(&self) -> PieceColor {
        self.position.turn()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot::capture(&self.position, self.phase, &self.history)
    }

    pub fn handle(&mut self, request: Request) -> Result<Response, MoveError> {
        match request {
            Request::Status => Ok(Response::Status(self.status())),
            Request::Move(request) => self.execute(request).map(Response::Moved),
        }
    }

    /// Resolve, actuate and commit one move request.
    pub fn execute(&mut self, request: MoveRequest) -> Result<MoveOutcome, MoveError> {
        let result = self.run(request);
        self.phase = Phase::WaitingForMove;
        match &result {
            Ok(outcome) => info!(record = %outcome.record, "move committed"),
            Err(MoveError::NoCandidate(reason)) => {
                warn!(%request, %reason, turn = %self.turn(), "move rejected")
            }
            Err(MoveError::Actuation(error)) => {
                warn!(%request, %error, "actuation failed, board unchanged")
            }
        }
        result
    }

    fn run(&mut self, request: MoveRequest) -> Result<MoveOutcome, MoveError> {
        self.phase = Phase::Resolving;
        let resolved = self.resolve(&request)?;

        if resolved.captures_at.is_some() {
            self.phase = Phase::CapturePending;
        }
        let (staged, record) = self.stage(&resolved);
        debug_assert_eq!(staged.verify(), Ok(()));

        self.phase = Phase::Actuating;
        self.actuate(&resolved)?;

        self.position = staged;
        self.history.push(record);
        self.phase = Phase::Committed;
        Ok(MoveOutcome {
            record,
            turn: self.position.turn(),
        })
    }

    /// Pick the single candidate for `request` without touching any state.
    pub fn resolve(&self, request: &MoveRequest) -> Result<ResolvedMove, NoCandidate> {
        let ctx = self.position.context();
        let managers = self.position.managers();
        let to = request.destination;

        let mut resolved = match (request.piece, request.promotion) {
            (_, Some(kind)) if !kind.is_promotion_target() => {
                return Err(NoCandidate::InvalidPromotion(kind))
            }
            (PieceKind::Pawn, Some(kind)) => {
                let pawns = managers.get(PieceKind::Pawn);
                match pawns.find_promoted(ctx.color, kind, request.source) {
                    Ok(_) | Err(NoCandidate::Ambiguous { .. }) => {
                        managers.resolve_promoted(kind, &ctx, request.source, to)?
                    }
                    Err(_) => {
                        let resolved =
                            managers.resolve(PieceKind::Pawn, &ctx, request.source, to)?;
                        if to.rank() != ctx.color.promotion_rank() {
                            return Err(NoCandidate::NotLastRank(to));
                        }
                        ResolvedMove {
                            promotion: Some(kind),
                            ..resolved
                        }
                    }
                }
            }
            (kind, Some(_)) => return Err(NoCandidate::InvalidPromotion(kind)),
            (kind, None) => managers.resolve(kind, &ctx, request.source, to)?,
        };

        let plain_pawn = resolved.kind == PieceKind::Pawn;
        if plain_pawn && resolved.promotion.is_none() && to.rank() == ctx.color.promotion_rank() {
            resolved.promotion = Some(PieceKind::Queen);
        }
        Ok(resolved)
    }

    /// Apply `resolved` to a copy of the position: retire any captured piece,
    /// move the mover, update memos and flip the turn.
    fn stage(&self, resolved: &ResolvedMove) -> (Position, MoveRecord) {
        let mut staged = self.position.clone();
        let (board, managers, memo, turn) = staged.parts_mut();

        let captured = resolved.captures_at.and_then(|at| {
            board.set_color(at, CellColor::PendingRemoval);
            let cell = board.cell_at(at);
            let kind = cell.kind?;
            let removed = managers.find_and_remove(kind, resolved.color.opponent(), at);
            debug_assert!(removed, "no roster entry for captured {kind} on {at}");
            board.clear(at);
            debug!(%kind, square = %at, "captured piece retired");
            Some(CapturedPiece { kind, square: at })
        });

        match resolved.shape {
            Shape::PawnDoubleStep => memo.record(resolved.color, resolved.to),
            _ => memo.clear(),
        }

        managers.apply_move(resolved);
        let landed_as = resolved.promotion.unwrap_or(resolved.kind);
        board.clear(resolved.from);
        board.place(resolved.to, resolved.color, landed_as);
        *turn = resolved.color.opponent();

        let record = MoveRecord {
            ply: self.history.len() + 1,
            color: resolved.color,
            kind: resolved.kind,
            from: resolved.from,
            to: resolved.to,
            captured,
            promotion: resolved.promotion,
            en_passant: resolved.is_en_passant(),
        };
        (staged, record)
    }

    fn actuate(&mut self, resolved: &ResolvedMove) -> Result<(), ActuatorError> {
        let result = self.drive(resolved);
        if result.is_err() {
            // Best effort: bring the effector home before reporting.
            if let Err(error) = self.actuator.retract_effector() {
                warn!(%error, "effector could not return home");
            }
        }
        result
    }

    fn drive(&mut self, resolved: &ResolvedMove) -> Result<(), ActuatorError> {
        if let Some(at) = resolved.captures_at {
            self.actuator.signal_capture(at)?;
        }
        for (from, to) in transport_legs(resolved.from, resolved.to) {
            debug!(%from, %to, "transport leg");
            self.actuator.move_effector(from, to)?;
        }
        self.actuator.retract_effector()
    }
}

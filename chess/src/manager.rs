//! Piece managers: one roster pair per kind plus the shared candidate search.
//!
//! Every kind runs the same search. Only the movement predicate differs, and
//! that comes from [`rules::accepts`]. Pawns that reached the last rank stay
//! in the pawn roster but move with the rule of their promoted kind, so the
//! manager of kind K also offers pawns promoted to K as candidates.

use smallvec::SmallVec;
use tracing::debug;

use crate::error::{NoCandidate, SetupError};
use crate::roster::{empty_roster, standard_roster, PieceRecord, Roster};
use crate::rules::{self, RuleContext, Shape};
use crate::square::Square;
use crate::types::{PieceColor, PieceKind};

/// Location of a record: which kind's roster and which slot in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSlot {
    pub roster: PieceKind,
    pub index: usize,
}

/// A candidate accepted by resolution. Applying it cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMove {
    /// Kind whose rule accepted the move.
    pub kind: PieceKind,
    pub color: PieceColor,
    pub from: Square,
    pub to: Square,
    pub shape: Shape,
    /// Square vacated by the captured piece. Differs from `to` only for en
    /// passant.
    pub captures_at: Option<Square>,
    /// Kind tagged on a pawn landing on the last rank.
    pub promotion: Option<PieceKind>,
    pub slot: PieceSlot,
}

impl ResolvedMove {
    pub fn is_capture(&self) -> bool {
        self.captures_at.is_some()
    }

    pub fn is_en_passant(&self) -> bool {
        matches!(self.shape, Shape::EnPassant { .. })
    }
}

/// Shared candidate search over a set of movers.
///
/// With a source square exactly one mover must stand there and only that
/// mover is evaluated. Without one, exactly one mover may accept the
/// destination; ambiguity is never guessed away.
fn resolve_among<'a>(
    movers: impl Iterator<Item = (PieceSlot, &'a PieceRecord)>,
    rule: PieceKind,
    ctx: &RuleContext<'_>,
    source: Option<Square>,
    to: Square,
) -> Result<ResolvedMove, NoCandidate> {
    if ctx.board.color_at(to) == Some(ctx.color) {
        return Err(NoCandidate::OwnPieceOnDestination(to));
    }

    let (slot, record, shape) = match source {
        Some(from) => {
            let mut at_source = movers.filter(|(_, r)| r.is_at(from));
            let (slot, record) = match (at_source.next(), at_source.next()) {
                (Some(found), None) => found,
                _ => {
                    return Err(NoCandidate::NoPieceAtSource {
                        kind: rule,
                        square: from,
                    })
                }
            };
            let shape =
                rules::accepts(rule, record, to, ctx).ok_or(NoCandidate::NoLegalCandidate(rule))?;
            (slot, record, shape)
        }
        None => {
            let matches: SmallVec<[(PieceSlot, &PieceRecord, Shape); 2]> = movers
                .filter_map(|(slot, r)| rules::accepts(rule, r, to, ctx).map(|s| (slot, r, s)))
                .collect();
            match matches.len() {
                1 => matches[0],
                0 => return Err(NoCandidate::NoLegalCandidate(rule)),
                count => {
                    debug!(%rule, count, %to, "ambiguous move request");
                    return Err(NoCandidate::Ambiguous { kind: rule, count });
                }
            }
        }
    };

    let captures_at = match shape {
        Shape::EnPassant { captured } => Some(captured),
        Shape::PawnStep | Shape::PawnDoubleStep => None,
        Shape::Plain | Shape::PawnCapture => ctx.board.is_occupied(to).then_some(to),
    };

    debug!(%rule, from = %record.square, %to, ?shape, "candidate resolved");
    Ok(ResolvedMove {
        kind: rule,
        color: ctx.color,
        from: record.square,
        to,
        shape,
        captures_at,
        promotion: None,
        slot,
    })
}

/// Rosters of one piece kind for both colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceManager {
    kind: PieceKind,
    rosters: [Roster; 2],
}

impl PieceManager {
    pub fn standard(kind: PieceKind) -> Self {
        Self {
            kind,
            rosters: [
                standard_roster(kind, PieceColor::White),
                standard_roster(kind, PieceColor::Black),
            ],
        }
    }

    /// A manager whose records are all off the board.
    pub fn empty(kind: PieceKind) -> Self {
        Self {
            kind,
            rosters: [empty_roster(kind), empty_roster(kind)],
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn roster(&self, color: PieceColor) -> &[PieceRecord] {
        &self.rosters[color.index()]
    }

    /// Live records of `color` that move with `rule`.
    fn movers(
        &self,
        color: PieceColor,
        rule: PieceKind,
    ) -> impl Iterator<Item = (PieceSlot, &PieceRecord)> + '_ {
        let kind = self.kind;
        self.roster(color)
            .iter()
            .enumerate()
            .filter(move |(_, r)| {
                r.alive
                    && match (kind, r.promoted_kind) {
                        (PieceKind::Pawn, None) => rule == PieceKind::Pawn,
                        (PieceKind::Pawn, Some(promoted)) => rule == promoted,
                        _ => rule == kind,
                    }
            })
            .map(move |(index, r)| (PieceSlot { roster: kind, index }, r))
    }

    /// Find this kind's single piece of the side to move that can reach
    /// `to`, optionally starting from `source`.
    ///
    /// Only this manager's own roster is searched; promoted pawns are
    /// handled by [`Managers`].
    pub(crate) fn resolve_candidate(
        &self,
        ctx: &RuleContext<'_>,
        source: Option<Square>,
        to: Square,
    ) -> Result<ResolvedMove, NoCandidate> {
        resolve_among(self.movers(ctx.color, self.kind), self.kind, ctx, source, to)
    }

    /// Locate the pawn of `color` promoted to `kind`, optionally restricted to
    /// `source`.
    pub(crate) fn find_promoted(
        &self,
        color: PieceColor,
        kind: PieceKind,
        source: Option<Square>,
    ) -> Result<Square, NoCandidate> {
        let found: SmallVec<[Square; 2]> = self
            .movers(color, kind)
            .filter(|(_, r)| r.promoted_kind.is_some())
            .filter(|(_, r)| source.map_or(true, |s| r.square == s))
            .map(|(_, r)| r.square)
            .collect();
        match (found.len(), source) {
            (1, _) => Ok(found[0]),
            (0, Some(square)) => Err(NoCandidate::NoPieceAtSource { kind, square }),
            (0, None) => Err(NoCandidate::NoLegalCandidate(kind)),
            (count, _) => Err(NoCandidate::Ambiguous { kind, count }),
        }
    }

    pub fn has_promoted(&self, color: PieceColor, kind: PieceKind) -> bool {
        self.roster(color)
            .iter()
            .any(|r| r.alive && r.promoted_kind == Some(kind))
    }

    /// Relocate the record named by `resolved` and apply its pawn effects.
    pub(crate) fn apply_move(&mut self, resolved: &ResolvedMove) {
        let record = &mut self.rosters[resolved.color.index()][resolved.slot.index];
        debug_assert!(record.is_at(resolved.from));
        record.square = resolved.to;
        record.first_move = false;
        if let Some(promoted) = resolved.promotion {
            record.promoted_kind = Some(promoted);
        }
    }

    /// Retire the live piece of `color` on `square`. Returns whether a piece
    /// was retired; calling it again is a no-op.
    pub fn find_and_remove(&mut self, color: PieceColor, square: Square) -> bool {
        match self.rosters[color.index()]
            .iter_mut()
            .find(|r| r.is_at(square))
        {
            Some(record) => {
                record.retire();
                true
            }
            None => false,
        }
    }

    /// Put a spare record of `color` on `square`.
    pub(crate) fn place(
        &mut self,
        color: PieceColor,
        square: Square,
        promoted: Option<PieceKind>,
    ) -> Result<(), SetupError> {
        let kind = self.kind;
        let slot = self.rosters[color.index()]
            .iter_mut()
            .find(|r| !r.alive)
            .ok_or(SetupError::RosterFull { color, kind })?;
        *slot = PieceRecord {
            square,
            alive: true,
            first_move: kind == PieceKind::Pawn
                && promoted.is_none()
                && square.rank() == color.pawn_rank(),
            promoted_kind: promoted,
        };
        Ok(())
    }
}

/// The six managers, indexed by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Managers {
    managers: [PieceManager; 6],
}

impl Managers {
    pub fn standard() -> Self {
        Self {
            managers: PieceKind::ALL.map(PieceManager::standard),
        }
    }

    pub fn empty() -> Self {
        Self {
            managers: PieceKind::ALL.map(PieceManager::empty),
        }
    }

    pub fn get(&self, kind: PieceKind) -> &PieceManager {
        &self.managers[kind.index()]
    }

    pub(crate) fn get_mut(&mut self, kind: PieceKind) -> &mut PieceManager {
        &mut self.managers[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceManager> {
        self.managers.iter()
    }

    /// Resolve a move of `rule` against its own roster together with the
    /// pawns promoted to it.
    pub(crate) fn resolve(
        &self,
        rule: PieceKind,
        ctx: &RuleContext<'_>,
        source: Option<Square>,
        to: Square,
    ) -> Result<ResolvedMove, NoCandidate> {
        if rule == PieceKind::Pawn || !self.get(PieceKind::Pawn).has_promoted(ctx.color, rule) {
            return self.get(rule).resolve_candidate(ctx, source, to);
        }
        let own = self.get(rule).movers(ctx.color, rule);
        let promoted = self.get(PieceKind::Pawn).movers(ctx.color, rule);
        resolve_among(own.chain(promoted), rule, ctx, source, to)
    }

    /// Resolve a move of the pawn promoted to `promoted`: find the pawn first,
    /// then run the target kind's rule with its square as a forced source.
    pub(crate) fn resolve_promoted(
        &self,
        promoted: PieceKind,
        ctx: &RuleContext<'_>,
        source: Option<Square>,
        to: Square,
    ) -> Result<ResolvedMove, NoCandidate> {
        let pawns = self.get(PieceKind::Pawn);
        let from = pawns.find_promoted(ctx.color, promoted, source)?;
        resolve_among(pawns.movers(ctx.color, promoted), promoted, ctx, Some(from), to)
    }

    /// Retire the live piece of `color` on `square` whose cell shows `kind`.
    /// Pawns promoted to `kind` are found in the pawn roster.
    pub(crate) fn find_and_remove(
        &mut self,
        kind: PieceKind,
        color: PieceColor,
        square: Square,
    ) -> bool {
        self.get_mut(kind).find_and_remove(color, square)
            || (kind != PieceKind::Pawn
                && self.get_mut(PieceKind::Pawn).find_and_remove(color, square))
    }

    pub(crate) fn apply_move(&mut self, resolved: &ResolvedMove) {
        self.get_mut(resolved.slot.roster).apply_move(resolved);
    }

    /// Every live piece as (color, effective kind, square).
    pub fn live_pieces(&self) -> impl Iterator<Item = (PieceColor, PieceKind, Square)> + '_ {
        self.managers.iter().flat_map(|m| {
            [PieceColor::White, PieceColor::Black]
                .into_iter()
                .flat_map(move |color| {
                    m.roster(color)
                        .iter()
                        .filter(|r| r.alive)
                        .map(move |r| (color, r.promoted_kind.unwrap_or(m.kind()), r.square))
                })
        })
    }
}

impl Default for Managers {
    fn default() -> Self {
        Self::standard()
    }
}

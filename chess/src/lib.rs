pub mod actuator;
pub mod board;
pub mod board_display;
pub mod error;
pub mod manager;
pub mod position;
pub mod request;
pub mod resolver;
pub mod roster;
pub mod rules;
pub mod snapshot;
pub mod square;
pub mod types;

pub use actuator::{check_leg, transport_legs, Actuator, ActuatorCall, RecordingActuator};
pub use board::{BoardState, Cell, CellColor};
pub use board_display::{DisplayBoard, DisplayBoardError};
pub use error::{ActuatorError, MoveError, NoCandidate, SetupError};
pub use manager::{Managers, PieceManager, PieceSlot, ResolvedMove};
pub use position::{Inconsistency, Position};
pub use request::{MoveRequest, Request};
pub use resolver::{MoveOutcome, MoveResolver, Phase, Response};
pub use roster::{PieceRecord, Roster};
pub use rules::{EnPassantMemo, Shape};
pub use snapshot::{CapturedPiece, MoveRecord, RosterSnapshot, StatusSnapshot};
pub use square::{ParseSquareError, Square};
pub use types::{PieceColor, PieceKind};

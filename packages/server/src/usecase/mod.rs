//! UseCase layer: one struct per coordinator operation.
//!
//! Each usecase depends on the domain traits (`SessionRegistry`,
//! `RoomPusher`, `Clock`) and returns a plain outcome value; serializing
//! and pushing the resulting events is the UI layer's job.

mod disconnect;
mod join_room;
mod leave_room;
mod send_message;
mod update_code;

pub use disconnect::DisconnectUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use send_message::SendMessageUseCase;
pub use update_code::{UpdateCodeUseCase, UpdateOutcome};

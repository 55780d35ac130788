pub mod error;
pub mod events;
pub mod fsm;
pub mod input;
pub mod presenter;
pub mod session;
pub mod setup;
pub mod state;
pub mod sync;
pub mod transport;

pub use error::{SetupError, TransportError};
pub use events::{EventLog, EventSink, GameEvent, NullSink};
pub use fsm::{Phase, PhaseAction, PhaseMachine, TransitionResult};
pub use presenter::{ColorScheme, NullPresenter, PaddleView, Presenter, SceneState};
pub use session::Session;
pub use setup::{run_all, SetupTask};
pub use state::{PaddleFlash, RemotePaddle};
pub use transport::{LoopbackTransport, Role, Transport};

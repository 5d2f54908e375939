//! Application layer of the jobchat assistant widget.
//!
//! [`ChatWidget`] wires the domain services to local storage and the HTTP
//! backend and exposes the operations a host UI binds to.

pub mod presentation;
pub mod quick_action_dispatcher;
pub mod request_pipeline;
pub mod telemetry;
pub mod widget;

pub use presentation::{PresentationController, PulseAnimator};
pub use quick_action_dispatcher::QuickActionDispatcher;
pub use request_pipeline::{
    FALLBACK_REPLY, PendingSend, PipelineStatus, RequestPipeline, ResponsePacing, SendOutcome,
};
pub use telemetry::init_tracing;
pub use widget::{ChatWidget, WidgetView};

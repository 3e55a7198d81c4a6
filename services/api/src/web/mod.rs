pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod session;
pub mod state;
pub mod timer_task;
pub mod views;
pub mod ws_handler;

// Re-export the handlers the binary wires into the router.
pub use middleware::require_session;
pub use rest::{
    add_activity_handler, add_thought_record_handler, complete_activity_handler,
    export_safety_plan_handler, get_quiz_handler, get_safety_plan_handler,
    list_activities_handler, list_sections_handler, list_thought_records_handler,
    save_safety_plan_handler, section_handler, submit_quiz_handler, worksheet_handler,
};
pub use session::{get_session_handler, reset_session_handler};
pub use ws_handler::timer_ws_handler;

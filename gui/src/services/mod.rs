// Services the GUI wires into the engine
pub mod submission_client;
pub mod webview;

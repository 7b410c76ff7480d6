mod hotkey_handler;
mod key_capture;
mod support;

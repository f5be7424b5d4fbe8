//! Network bring-up (ESP-IDF only).

pub mod wifi;

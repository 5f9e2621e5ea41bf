//! Warning delivery from storage code to UI subscribers.

pub mod bus;

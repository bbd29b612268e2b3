//
// Do not put code in `mod.rs`, but put in e.g. `chats.rs`.
//

pub mod action_items;
pub mod chats;
pub mod data;
pub mod folders;
pub mod memories;

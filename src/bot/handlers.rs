mod autojoin;
pub use autojoin::autojoin_authorized_rooms;

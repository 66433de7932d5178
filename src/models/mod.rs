pub mod address;
pub mod contact;

pub use address::{Address, AddressChanges, NewAddress};
pub use contact::{Contact, ContactChanges, ContactRow, NewContact};

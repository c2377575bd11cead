pub mod artist;
pub mod show;
pub mod venue;

pub use artist::Artist;
pub use show::Show;
pub use venue::Venue;

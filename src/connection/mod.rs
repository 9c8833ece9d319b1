//! Race views: the async handle applications hold

pub mod view;


pub use view::RaceView;

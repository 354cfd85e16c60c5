pub mod fragment;
pub mod collapse;
pub mod controller;

pub use fragment::GraphFragment;
pub use collapse::GraphPiece;
pub use controller::{GraphPieceController, PieceId, PieceRegistry, SimpleGraphPieceController};

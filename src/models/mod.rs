pub mod order_comment;
pub mod order_image;
pub mod pedido;
pub mod refresh_token;
pub mod saved_filter;
pub mod user;

// Re-export common types
pub use order_comment::{NewOrderComment, OrderComment, OrderCommentError};
pub use order_image::{NewOrderImage, OrderImage, OrderImageError};
pub use pedido::{NewPedido, Pedido};
pub use refresh_token::{NewRefreshToken, RefreshToken, RefreshTokenError};
pub use saved_filter::{SavedFilter, SavedFilterError};
pub use user::{NewUser, User, UserError};

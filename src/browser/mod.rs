//! 浏览器连接
//!
//! 只连接已经在运行的浏览器，不负责启动或关闭它

pub mod connection;

pub use connection::connect_to_browser_and_page;

mod config;
mod driver;
mod window;

mod app;
mod catalog;
mod persistence;

/*
 * Responsibility
 * - courier サービス共通の土台 (auth middleware / guard / 起動まわり)
 * - 各サービスはこの crate で Router を組み立てて起動する
 */
pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod services;

/*
 * Responsibility
 * - Public interface of the middleware layer
 * - auth: bearer authentication + access-denied response
 * - http: transport-level layers (request id, tracing, limits)
 */
pub mod auth;
pub mod http;

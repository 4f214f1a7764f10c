/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 */
pub mod authorization;
pub mod cors;

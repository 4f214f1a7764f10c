/*
 * Responsibility
 * - authorization サービスの公開インターフェース (re-export)
 */
pub mod guard;
pub mod introspection;
pub mod roles;
pub mod user_info;

pub use guard::AuthorizationGuard;
pub use roles::Role;
pub use user_info::UserInfo;

/*
 * Responsibility
 * - Handler から見える「認可済み呼び出し元」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - introspection response から 1 リクエスト毎に組み立てる。キャッシュも永続化もしない。
 */

/// Identity resolved from a bearer token by the authorization server.
///
/// - `roles` holds realm role names as returned by the server; policy
///   evaluation is plain string membership against them
/// - `email_verified` is informational only, it does not gate access
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub username: String,
    pub active: bool,
    pub email_verified: bool,
    pub roles: Vec<String>,
}

// Diesel table definitions for the pedidos database.
//
// `users` and `pedidos` pre-exist this crate; only the columns the model
// layer touches are declared for them. The remaining tables are created by
// the embedded migration (see migrations::steps) and are declared in full,
// in physical column order.

diesel::table! {
    users (id) {
        id -> Integer,
        email -> Text,
        hashed_password -> Text,
        full_name -> Nullable<Text>,
        role -> Text,
        is_active -> Bool,
        created_at -> Timestamp,
        is_email_verified -> Bool,
        email_verification_token -> Nullable<Text>,
        fcm_token -> Nullable<Text>,
        apns_token -> Nullable<Text>,
    }
}

diesel::table! {
    pedidos (id) {
        id -> Integer,
        usuario_id -> Nullable<Integer>,
        resumen_items -> Text,
        estado -> Text,
        fecha_creacion -> Timestamp,
    }
}

diesel::table! {
    refresh_tokens (id) {
        id -> Integer,
        user_id -> Integer,
        token -> Text,
        expires_at -> Timestamp,
        is_revoked -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    imagenes_pedidos (id) {
        id -> Integer,
        pedido_id -> Integer,
        url -> Text,
        filename -> Text,
        size_bytes -> Nullable<Integer>,
        mime_type -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    comentarios_pedidos (id) {
        id -> Integer,
        pedido_id -> Integer,
        user_id -> Integer,
        comentario -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    filtros_guardados (id) {
        id -> Integer,
        usuario_id -> Integer,
        nombre -> Text,
        filtros_json -> Text,
        is_default -> Bool,
        created_at -> Timestamp,
    }
}

diesel::joinable!(refresh_tokens -> users (user_id));
diesel::joinable!(imagenes_pedidos -> pedidos (pedido_id));
diesel::joinable!(comentarios_pedidos -> pedidos (pedido_id));
diesel::joinable!(comentarios_pedidos -> users (user_id));
diesel::joinable!(filtros_guardados -> users (usuario_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    pedidos,
    refresh_tokens,
    imagenes_pedidos,
    comentarios_pedidos,
    filtros_guardados,
);

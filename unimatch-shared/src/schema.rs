// Kept in sync with the DDL in `clients::db::ensure_schema`.

diesel::table! {
    users (id) {
        id -> Integer,
        name -> Text,
        student_number -> Text,
        gender -> Nullable<Text>,
        interested_in -> Nullable<Text>,
        whatsapp -> Text,
        looking_for -> Nullable<Text>,
        about_me -> Nullable<Text>,
    }
}

diesel::table! {
    matches (id) {
        id -> Integer,
        user_id -> Integer,
        candidate_id -> Integer,
        score -> Double,
        created_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    matches,
);

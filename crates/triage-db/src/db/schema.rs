// Keep in sync with migrations/.

diesel::table! {
    app_user (id) {
        id -> Uuid,
        email -> Text,
        display_name -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    project (id) {
        id -> Uuid,
        key -> Text,
        name -> Text,
        description -> Nullable<Text>,
        created_by -> Uuid,
        created_at -> Timestamptz,
        ticket_sequence -> Int4,
    }
}

diesel::table! {
    project_membership (id) {
        id -> Uuid,
        project_id -> Uuid,
        user_id -> Uuid,
        role -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    ticket (id) {
        id -> Uuid,
        project_id -> Uuid,
        key -> Text,
        title -> Text,
        description -> Nullable<Text>,
        status -> Text,
        priority -> Text,
        assignee_id -> Nullable<Uuid>,
        reporter_id -> Uuid,
        due_date -> Nullable<Date>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    ticket_comment (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        visibility -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(project_membership -> project (project_id));
diesel::joinable!(project_membership -> app_user (user_id));
diesel::joinable!(ticket -> project (project_id));
diesel::joinable!(ticket_comment -> ticket (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(
    app_user,
    project,
    project_membership,
    ticket,
    ticket_comment,
);

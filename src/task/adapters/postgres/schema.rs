//! Diesel schema for activity import persistence.

diesel::table! {
    /// Imported activity records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Activity name.
        name -> Text,
        /// Customer company.
        company_id -> Nullable<Uuid>,
        /// Contact person.
        contact_id -> Nullable<Uuid>,
        /// Assigned user.
        user_id -> Uuid,
        /// Deadline, midnight for date-only values.
        date_deadline -> Nullable<Timestamp>,
        /// Whether `date_deadline` carries a time of day.
        deadline_has_time -> Bool,
        /// Workflow stage.
        stage_id -> Uuid,
        /// Macro type tags.
        macro_type_tag_ids -> Array<Uuid>,
        /// Activity type tags.
        activity_type_tag_ids -> Array<Uuid>,
        /// Commessa code as imported.
        project_code -> Nullable<Text>,
        /// Resolved project.
        project_id -> Nullable<Uuid>,
        /// Free-text description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task tags, unique per label and category.
    task_tags (id) {
        /// Tag identifier.
        id -> Uuid,
        /// Tag label.
        label -> Text,
        /// Tag category.
        #[max_length = 50]
        category -> Varchar,
    }
}

diesel::table! {
    /// Task workflow stages.
    task_stages (id) {
        /// Stage identifier.
        id -> Uuid,
        /// Stage label.
        label -> Text,
        /// Owning project for project-specific stages.
        project_id -> Nullable<Uuid>,
        /// Whether the stage is folded on boards.
        folded -> Bool,
        /// Creation timestamp, used for stable ordering.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects, read-only for the importer.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Commessa code.
        #[max_length = 50]
        code -> Nullable<Varchar>,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Stage new tasks start in.
        default_stage_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Users, read-only for the importer.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Companies and contact partners, read-only for the importer.
    companies (id) {
        /// Partner identifier.
        id -> Uuid,
        /// Partner name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, task_tags, task_stages, projects, users, companies);

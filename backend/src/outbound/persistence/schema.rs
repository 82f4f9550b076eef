//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. `diesel
//! print-schema` against a migrated database regenerates them.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        /// Unique login name, at most 50 characters.
        username -> Varchar,
        /// Unique, lowercased email address.
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        role -> Varchar,
        created_at -> Timestamptz,
        last_login -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Optional per-user profile; one row at most per user.
    user_profiles (user_id) {
        user_id -> Int8,
        avatar_path -> Nullable<Varchar>,
        color_scheme -> Nullable<Varchar>,
        bio -> Nullable<Text>,
        is_public -> Bool,
    }
}

diesel::table! {
    /// Schools and communities.
    organizations (id) {
        id -> Int8,
        org_type -> Varchar,
        name -> Varchar,
        profile -> Nullable<Text>,
        is_public -> Bool,
        subscription_status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership of a user in an organization, unique per (org, user).
    organization_members (id) {
        id -> Int8,
        org_id -> Int8,
        user_id -> Int8,
        role -> Varchar,
        /// Unique across all memberships when present.
        access_code -> Nullable<Varchar>,
        joined_on -> Date,
    }
}

diesel::table! {
    classes (id) {
        id -> Int8,
        org_id -> Int8,
        teacher_id -> Int8,
        name -> Varchar,
        syllabus -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    class_enrollments (id) {
        id -> Int8,
        class_id -> Int8,
        student_id -> Int8,
        enrolled_on -> Date,
        status -> Varchar,
    }
}

diesel::table! {
    programs (id) {
        id -> Int8,
        name -> Varchar,
        description -> Nullable<Text>,
        program_type -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Enrollment of exactly one user or organization in a program.
    program_enrollments (id) {
        id -> Int8,
        program_id -> Int8,
        user_id -> Nullable<Int8>,
        org_id -> Nullable<Int8>,
        enrolled_on -> Date,
        status -> Varchar,
    }
}

diesel::table! {
    activities (id) {
        id -> Int8,
        program_id -> Int8,
        class_id -> Nullable<Int8>,
        name -> Varchar,
        activity_type -> Varchar,
        description -> Nullable<Text>,
        created_by -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    content_library (id) {
        id -> Int8,
        title -> Varchar,
        content_type -> Varchar,
        body -> Nullable<Text>,
        created_by -> Int8,
        org_id -> Nullable<Int8>,
        is_public -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    species_sightings (id) {
        id -> Int8,
        species_name -> Varchar,
        location -> Varchar,
        observed_at -> Timestamptz,
        description -> Nullable<Text>,
        photo_path -> Nullable<Varchar>,
        reported_by -> Int8,
        verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    submissions (id) {
        id -> Int8,
        activity_id -> Int8,
        student_id -> Int8,
        data -> Nullable<Text>,
        file_path -> Nullable<Varchar>,
        submitted_at -> Timestamptz,
        status -> Varchar,
    }
}

diesel::table! {
    /// Grades; at most one per submission.
    assessments (id) {
        id -> Int8,
        submission_id -> Int8,
        teacher_id -> Int8,
        grade -> Varchar,
        feedback -> Nullable<Text>,
        assessed_at -> Timestamptz,
    }
}

diesel::table! {
    messages (id) {
        id -> Int8,
        sender_id -> Int8,
        recipient_id -> Int8,
        text -> Text,
        sent_at -> Timestamptz,
        read_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    notes (id) {
        id -> Int8,
        teacher_id -> Int8,
        target_type -> Varchar,
        target_id -> Int8,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Canvas documents keyed by (user, program).
    creative_canvas (id) {
        id -> Int8,
        user_id -> Int8,
        program_id -> Int8,
        assets -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail. `user_id` is nulled when the account goes.
    access_logs (id) {
        id -> Int8,
        user_id -> Nullable<Int8>,
        action -> Varchar,
        target_type -> Nullable<Varchar>,
        target_id -> Nullable<Int8>,
        recorded_at -> Timestamptz,
        origin -> Nullable<Varchar>,
    }
}

diesel::table! {
    business_analytics (id) {
        id -> Int8,
        metric_type -> Varchar,
        metric_value -> Nullable<Float8>,
        metric_data -> Nullable<Jsonb>,
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(organization_members -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_profiles,
    organizations,
    organization_members,
    classes,
    class_enrollments,
    programs,
    program_enrollments,
    activities,
    content_library,
    species_sightings,
    submissions,
    assessments,
    messages,
    notes,
    creative_canvas,
    access_logs,
    business_analytics,
);

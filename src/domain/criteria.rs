use crate::define_criteria;
use crate::filtering::{LongFilter, StringFilter, ZonedDateTimeFilter};

define_criteria! {
    /// Filters over posts. `postStatusId` is matched against the joined status.
    PostCriteria {
        id: LongFilter => "id",
        title: StringFilter => "title",
        content: StringFilter => "content",
        create_time: ZonedDateTimeFilter => "createTime",
        update_time: ZonedDateTimeFilter => "updateTime",
        post_status_id: LongFilter => "postStatusId",
    }
}

define_criteria! {
    /// Filters over comments. `postId` is matched against the joined post.
    CommentCriteria {
        id: LongFilter => "id",
        content: StringFilter => "content",
        create_time: ZonedDateTimeFilter => "createTime",
        post_id: LongFilter => "postId",
    }
}

define_criteria! {
    PostStatusCriteria {
        id: LongFilter => "id",
        status: StringFilter => "status",
    }
}

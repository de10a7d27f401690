use shelf_core::model::GoalPeriod;
use shelf_core::progress::GoalPace;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalCardVm {
    pub pages_per_day: u64,
    pub target_pages: u32,
    pub period_label: &'static str,
    pub days_label: String,
}

impl From<&GoalPace> for GoalCardVm {
    fn from(pace: &GoalPace) -> Self {
        Self {
            pages_per_day: pace.pages_per_day,
            target_pages: pace.target_pages,
            period_label: match pace.period {
                GoalPeriod::Week => "This week",
                GoalPeriod::Month => "This month",
            },
            days_label: format!("Over {} days", pace.days()),
        }
    }
}

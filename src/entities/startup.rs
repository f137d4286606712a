use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "startups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub founder_id: Option<i32>,
    pub name: String,
    pub industry: String,
    pub stage: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub funding_goal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount_raised: Decimal,
    /// Percentage of equity offered for the full funding goal
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub equity: Option<Decimal>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub website: String,
    pub team_size: Option<i32>,
    pub location: String,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Funding still open: `funding_goal - amount_raised`, never negative.
    pub fn remaining_capacity(&self) -> Decimal {
        (self.funding_goal - self.amount_raised).max(Decimal::ZERO)
    }

    /// Implied valuation, `funding_goal / (equity / 100)`. `None` without a positive equity stake.
    pub fn valuation(&self) -> Option<Decimal> {
        let equity = self.equity.filter(|e| *e > Decimal::ZERO)?;
        self.funding_goal
            .checked_div(equity / Decimal::ONE_HUNDRED)
            .map(|v| v.round_dp(2))
    }

    pub fn is_owned_by(&self, founder_id: i32) -> bool {
        self.founder_id == Some(founder_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FounderId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Founder,
    #[sea_orm(has_many = "super::investment_request::Entity")]
    InvestmentRequest,
    #[sea_orm(has_many = "super::saved_startup::Entity")]
    SavedStartup,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Founder.def()
    }
}

impl Related<super::investment_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestmentRequest.def()
    }
}

impl Related<super::saved_startup::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedStartup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

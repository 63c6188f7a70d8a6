/// 사용자 조회
pub const GET_USER: &str =
    "SELECT id, username, email, admin, created_at, updated_at FROM users WHERE id = $1";

/// 모든 상품 + 판매자 조회
pub const GET_ALL_PRODUCTS_WITH_SELLER: &str = r#"
    SELECT p.id, p.name, p.description, p.category, p.original_price, p.picture_url,
           p.end_date, p.seller_id, p.created_at, p.updated_at,
           s.id AS s_id, s.username AS s_username, s.email AS s_email, s.admin AS s_admin,
           s.created_at AS s_created_at, s.updated_at AS s_updated_at
    FROM products p
    JOIN users s ON s.id = p.seller_id
    ORDER BY p.id
"#;

/// 상품 + 판매자 조회
pub const GET_PRODUCT_WITH_SELLER: &str = r#"
    SELECT p.id, p.name, p.description, p.category, p.original_price, p.picture_url,
           p.end_date, p.seller_id, p.created_at, p.updated_at,
           s.id AS s_id, s.username AS s_username, s.email AS s_email, s.admin AS s_admin,
           s.created_at AS s_created_at, s.updated_at AS s_updated_at
    FROM products p
    JOIN users s ON s.id = p.seller_id
    WHERE p.id = $1
"#;

/// 상품들의 입찰 + 입찰자 조회
pub const GET_BIDS_WITH_BIDDER_FOR_PRODUCTS: &str = r#"
    SELECT b.id, b.price, b.date, b.product_id, b.bidder_id, b.created_at, b.updated_at,
           u.id AS u_id, u.username AS u_username, u.email AS u_email, u.admin AS u_admin,
           u.created_at AS u_created_at, u.updated_at AS u_updated_at
    FROM bids b
    JOIN users u ON u.id = b.bidder_id
    WHERE b.product_id = ANY($1)
    ORDER BY b.id
"#;

/// 상품 조회
pub const GET_PRODUCT: &str = r#"
    SELECT id, name, description, category, original_price, picture_url, end_date,
           seller_id, created_at, updated_at
    FROM products
    WHERE id = $1
"#;

/// 판매자의 상품 조회
pub const GET_PRODUCTS_BY_SELLER: &str = r#"
    SELECT id, name, description, category, original_price, picture_url, end_date,
           seller_id, created_at, updated_at
    FROM products
    WHERE seller_id = $1
    ORDER BY id
"#;

/// 입찰자의 입찰 + 상품 조회
pub const GET_BIDS_WITH_PRODUCT_BY_BIDDER: &str = r#"
    SELECT b.id, b.price, b.date, b.product_id, b.bidder_id, b.created_at, b.updated_at,
           p.id AS p_id, p.name AS p_name, p.description AS p_description,
           p.category AS p_category, p.original_price AS p_original_price,
           p.picture_url AS p_picture_url, p.end_date AS p_end_date,
           p.seller_id AS p_seller_id, p.created_at AS p_created_at,
           p.updated_at AS p_updated_at
    FROM bids b
    JOIN products p ON p.id = b.product_id
    WHERE b.bidder_id = $1
    ORDER BY b.id
"#;

/// 입찰 + 상품 조회
pub const GET_BID_WITH_PRODUCT: &str = r#"
    SELECT b.id, b.price, b.date, b.product_id, b.bidder_id, b.created_at, b.updated_at,
           p.id AS p_id, p.name AS p_name, p.description AS p_description,
           p.category AS p_category, p.original_price AS p_original_price,
           p.picture_url AS p_picture_url, p.end_date AS p_end_date,
           p.seller_id AS p_seller_id, p.created_at AS p_created_at,
           p.updated_at AS p_updated_at
    FROM bids b
    JOIN products p ON p.id = b.product_id
    WHERE b.id = $1
"#;

/// 상품 등록
pub const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (name, description, category, original_price, picture_url, end_date, seller_id)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, name, description, category, original_price, picture_url, end_date,
              seller_id, created_at, updated_at
"#;

/// 상품 전체 수정
pub const UPDATE_PRODUCT: &str = r#"
    UPDATE products
    SET name = $2, description = $3, category = $4, original_price = $5,
        picture_url = $6, end_date = $7, updated_at = NOW()
    WHERE id = $1
    RETURNING id, name, description, category, original_price, picture_url, end_date,
              seller_id, created_at, updated_at
"#;

/// 상품 삭제
pub const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1";

/// 입찰 등록
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (price, date, product_id, bidder_id, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $2, $2)
    RETURNING id, price, date, product_id, bidder_id, created_at, updated_at
"#;

/// 입찰 삭제
pub const DELETE_BID: &str = "DELETE FROM bids WHERE id = $1";
